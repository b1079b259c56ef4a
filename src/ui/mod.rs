pub mod keybindings;
pub mod lightbox;

pub use keybindings::{Key, LightboxAction};
pub use lightbox::{LightboxController, LightboxState, Playback, Presentation};
