//! App-level state: `app/route`, `app/realtime`.

/// Navigation route. Set to `/login` when credentials are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct AppRoute(pub String);

impl AppRoute {
    pub const PATH: &'static str = "app/route";
}

/// Inputs that gate background polling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealtimeState {
    /// User/config switch for live refresh.
    pub enabled: bool,
    /// Host lifecycle: app in the foreground.
    pub foreground: bool,
}

impl RealtimeState {
    pub const PATH: &'static str = "app/realtime";

    pub fn polling(&self) -> bool {
        self.enabled && self.foreground
    }
}
