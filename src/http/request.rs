use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    /// User agent presented with this request.
    pub identity: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(url: Url, identity: impl Into<String>) -> Self {
        Self {
            url,
            identity: identity.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}
