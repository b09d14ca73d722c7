pub mod check;
pub mod play;
pub mod roll;

use std::path::Path;

use gb_story::{Adventure, sample};

/// Load an adventure file, or a bundled sample by name.
fn load_adventure(file: Option<&Path>, sample: Option<&str>) -> Result<Adventure, String> {
    match (file, sample) {
        (Some(path), _) => {
            Adventure::load(path).map_err(|e| format!("cannot load '{}': {e}", path.display()))
        }
        (None, Some("dark-tower" | "dark_tower")) => sample::dark_tower().map_err(|e| e.to_string()),
        (None, Some("goblin-cave" | "goblin_cave")) => {
            sample::goblin_cave().map_err(|e| e.to_string())
        }
        (None, Some(other)) => Err(format!(
            "unknown sample '{other}' (expected dark-tower or goblin-cave)"
        )),
        (None, None) => Err("no adventure given".into()),
    }
}
