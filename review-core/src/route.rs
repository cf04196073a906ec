//! Navigation targets exposed by the workflows

/// A view the front-end can navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The review list, at the root path
    List,
    /// One review, keyed by its id
    Detail(String),
    /// The submission form
    Submit,
}

impl Route {
    /// Route to the detail view of a review
    pub fn detail(id: impl Into<String>) -> Self {
        Route::Detail(id.into())
    }

    /// Path for this route; the review id is percent-encoded
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Detail(id) => format!("/reviews/{}", urlencoding::encode(id)),
            Route::Submit => "/submit".to_string(),
        }
    }

    /// Parse a path back into a route
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::List),
            "/submit" => Some(Route::Submit),
            _ => {
                let id = trimmed.strip_prefix("/reviews/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                let id = urlencoding::decode(id).ok()?;
                Some(Route::detail(id.into_owned()))
            }
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}
