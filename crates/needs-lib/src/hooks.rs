use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// UI capabilities injected into the session driver.
pub trait SessionHooks: Send + Sync {
    fn notify(&self, notice: Notice);
    fn redirect_to(&self, path: &str);
}

/// Hooks for headless use: notices and redirects become log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

impl SessionHooks for TracingHooks {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                tracing::warn!(title = %notice.title, "{}", notice.message)
            }
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(title = %notice.title, "{}", notice.message)
            }
        }
    }

    fn redirect_to(&self, path: &str) {
        tracing::info!(path, "redirect requested");
    }
}

impl<T: SessionHooks + ?Sized> SessionHooks for &T {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }

    fn redirect_to(&self, path: &str) {
        (**self).redirect_to(path);
    }
}
