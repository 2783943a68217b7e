// AuthPlugin trait: what the host application sees of an auth plugin.
//
// A plugin contributes a stable registry key, display metadata for login
// buttons, and the set of routes it wants mounted. The host decides where
// and how to mount them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four flow entry points an auth plugin exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Start an outgoing sign-in request.
    Initialize,
    /// Start an outgoing signup request.
    Signup,
    /// Handle the provider redirecting back.
    Callback,
    /// Attach the provider to an already signed-in user.
    Connect,
    /// Detach the provider from the current user.
    Disconnect,
}

/// HTTP methods for plugin endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A route the plugin wants the host to mount.
#[derive(Debug, Clone)]
pub struct PluginEndpoint {
    /// The route path (e.g. "/login/github").
    pub path: String,
    pub method: HttpMethod,
    /// Which flow the route enters.
    pub flow: FlowKind,
    /// Whether the route requires a signed-in user.
    pub require_auth: bool,
}

impl PluginEndpoint {
    pub fn get(path: impl Into<String>, flow: FlowKind, require_auth: bool) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Get,
            flow,
            require_auth,
        }
    }
}

/// The plugin trait every identity-provider plugin implements.
pub trait AuthPlugin: Send + Sync + fmt::Debug {
    /// Stable registry key (e.g. "github").
    fn key(&self) -> &str;

    /// Human-readable provider name.
    fn display_name(&self) -> &str {
        self.key()
    }

    /// Base64-encoded logo for login buttons, if the plugin ships one.
    fn logo(&self) -> Option<&str> {
        None
    }

    /// The routes this plugin wants mounted.
    fn endpoints(&self) -> Vec<PluginEndpoint>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_kind_serializes_lowercase() {
        let json = serde_json::to_value(FlowKind::Disconnect).unwrap();
        assert_eq!(json, "disconnect");
    }

    #[test]
    fn endpoint_get_helper() {
        let ep = PluginEndpoint::get("/login/github", FlowKind::Initialize, false);
        assert_eq!(ep.path, "/login/github");
        assert_eq!(ep.method, HttpMethod::Get);
        assert_eq!(ep.flow, FlowKind::Initialize);
        assert!(!ep.require_auth);
    }
}
