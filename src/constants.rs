//! Shared constants for timing defaults, validation ranges, and bus names.

/// How long a collapsed pill stays on screen before auto-dismissal (ms).
pub const DEFAULT_PILL_DURATION_MS: u64 = 4000;

/// How long the expanded view stays on screen before auto-dismissal (ms).
pub const DEFAULT_EXPANDED_DURATION_MS: u64 = 8000;

/// Nominal duration of the renderer's grow/shrink animation (ms).
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 400;

/// Grace period added to the animation duration before the re-entrancy
/// guard is released (ms).
pub const ANIMATION_SETTLE_GRACE_MS: u64 = 100;

/// Delay before the "dot" class is applied at the start of an intro (ms).
pub const INTRO_DOT_DELAY_MS: u64 = 50;

/// Delay between the "dot" class and the "pill" class during an intro (ms).
pub const INTRO_PILL_DELAY_MS: u64 = 100;

/// Delay before the "dot" class is stripped during an outro (ms).
pub const OUTRO_DOT_REMOVAL_DELAY_MS: u64 = 250;

/// Delay before expanded content is populated after a click-to-expand,
/// letting the expand animation start first (ms).
pub const EXPANDED_CONTENT_DELAY_MS: u64 = 50;

// Validation ranges for user-configurable durations
pub const MIN_DISPLAY_DURATION_MS: u64 = 100;
pub const MAX_DISPLAY_DURATION_MS: u64 = 600_000;
pub const MIN_ANIMATION_DURATION_MS: u64 = 50;
pub const MAX_ANIMATION_DURATION_MS: u64 = 5_000;

// Visual class names shared with the renderer's stylesheet
pub const CLASS_DOT: &str = "dot";
pub const CLASS_PILL: &str = "pill";
pub const CLASS_EXPANDED: &str = "expanded";

// Session bus identity of the UI service
pub const DBUS_BUS_NAME: &str = "com.meismeric.auranotify.UI";
pub const DBUS_OBJECT_PATH: &str = "/com/meismeric/auranotify/UI";

/// Renderer socket file name under the runtime directory.
pub const SOCKET_FILE_NAME: &str = "auroranotify-ui.sock";

/// Lock file name under the runtime directory.
pub const LOCK_FILE_NAME: &str = "auroranotify-ui.lock";

/// Exit code used when startup fails in a way that was already logged.
pub const EXIT_FAILURE: i32 = 1;
