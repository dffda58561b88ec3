//! Timer service API module
//!
//! This module is the only place the crate talks HTTP. Both the viewer and
//! the admin console go through `ApiClient`.
//!
//! # Overview
//!
//! - **`models`**: wire types (`TimerId`, `TimerState`, `ThemeSettings`,
//!   `StatusSnapshot`, `ControlAction`, ...)
//! - **`client`**: the blocking HTTP client and its normalised `ApiOutcome`
//! - **`notify`**: the `Notifier` hook used to surface transport failures
//!
//! # Endpoints
//!
//! | Endpoint | Method | Wrapper |
//! |---|---|---|
//! | `/api/timer_status` | GET | `timer_status` |
//! | `/api/control_timer/<id>` | POST | `control_timer` |
//! | `/api/theme` | GET / POST | `get_theme` / `set_theme` |
//! | `/api/change_pin` | POST | `change_pin` |
//! | `/api/get_logos` | GET | `get_logos` |
//! | `/api/upload_logo` | POST (multipart) | `upload_logo` |
//! | `/api/delete_logo/<filename>` | DELETE | `delete_logo` |
//! | `/login` | POST (form) | `login` |

pub mod client;
pub mod models;
pub mod notify;

pub use client::{ApiClient, ApiOutcome, UploadsLocation, is_valid_pin};
pub use models::{
    ControlAction, DEFAULT_BACKGROUND, DEFAULT_FONT_COLOR, DeleteLogoOutcome, Logo,
    StatusSnapshot, ThemeForm, ThemeSettings, TimerId, TimerState, parse_time_field,
};
pub use notify::Notifier;
