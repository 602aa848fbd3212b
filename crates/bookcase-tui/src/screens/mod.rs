//! Screen implementations. Each screen is a top-level Component.

pub mod editor;
pub mod library;

use crate::component::Component;
use crate::screen::ScreenId;

pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Library, Box::new(library::LibraryScreen::new())),
        (ScreenId::Editor, Box::new(editor::EditorScreen::new())),
    ]
}
