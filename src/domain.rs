/// One `<item>` of the alert feed. Every field is optional in the source markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
}

impl AlertRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_pub_date(mut self, pub_date: impl Into<String>) -> Self {
        self.pub_date = Some(pub_date.into());
        self
    }
}
