//! Observable events for filedrop
//!
//! Every log line names exactly one of these events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// No signing secret configured; an ephemeral one was generated
    EphemeralSecret,
    /// HTTP server bound and serving
    Serving,
    /// Server failed to start (FATAL)
    BootFailed,

    // Storage
    /// Owner folder marker written
    FolderEnsured,
    /// File persisted
    UploadComplete,
    /// Owner listing produced
    ListComplete,
    /// Backend call failed
    StoreFailed,

    // Links
    /// Download link signed
    LinkIssued,
    /// Link requested for a file absent from the owner's listing
    LinkNotFound,
    /// Signing failed
    LinkFailed,
    /// Presented link expired or carried a bad signature
    LinkRejected,
    /// Object bytes served through a valid link
    ObjectServed,

    // Requests
    /// Request rejected before reaching storage
    RequestRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FILEDROP_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::EphemeralSecret => "EPHEMERAL_SIGNING_SECRET",
            Event::Serving => "FILEDROP_SERVING",
            Event::BootFailed => "FILEDROP_STARTUP_FAILED",

            Event::FolderEnsured => "FOLDER_ENSURED",
            Event::UploadComplete => "UPLOAD_COMPLETE",
            Event::ListComplete => "LIST_COMPLETE",
            Event::StoreFailed => "STORE_FAILED",

            Event::LinkIssued => "LINK_ISSUED",
            Event::LinkNotFound => "LINK_NOT_FOUND",
            Event::LinkFailed => "LINK_FAILED",
            Event::LinkRejected => "LINK_REJECTED",
            Event::ObjectServed => "OBJECT_SERVED",

            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }

    /// Failures that go to stderr at ERROR severity
    pub fn is_error(&self) -> bool {
        matches!(self, Event::StoreFailed | Event::LinkFailed)
    }

    /// Degraded but non-failing conditions
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::EphemeralSecret | Event::LinkRejected | Event::RequestRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
