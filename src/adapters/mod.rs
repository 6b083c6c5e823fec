//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements        | Connects to                 |
//! |---------------|-------------------|-----------------------------|
//! | `audio`       | AudioPort         | rodio output stream (ALSA)  |
//! | `config_file` | ConfigPort        | JSON file on disk           |
//! | `hardware`    | LightPort         | rppal software PWM          |
//! |               | MotionPort        | rppal GPIO input            |
//! | `log_sink`    | EventSink         | `log` facade                |

#[cfg(feature = "hardware")]
pub mod audio;
pub mod config_file;
#[cfg(feature = "hardware")]
pub mod hardware;
pub mod log_sink;
