use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// A plain text template. Values are inserted verbatim, so anything that
/// ends up in a template must already be sanitized.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = stringify!($ident);
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    NotificationTemplate("notification.txt"),
    CopyTemplate("copy.txt"),
}

/// Message to the site owner about a new submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationTemplate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject_label: String,
    pub message: String,
    pub site: String,
}

/// Confirmation sent to the sender when they asked for a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyTemplate {
    pub owner_name: String,
    pub owner_email: String,
    pub message: String,
}
