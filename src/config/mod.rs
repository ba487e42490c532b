mod settings;

pub use settings::{
    RetryConfig, SenderConfig, ServerConfig, Settings, SmtpConfig, TemplateConfig,
};
