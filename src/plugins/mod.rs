//! Built-in plugins.
//!
//! | name       | phase      | order | batched |
//! |------------|------------|-------|---------|
//! | `inspect`  | normalize  | 0     | no      |
//! | `block`    | structure  | 0     | no      |
//! | `list`     | structure  | 10    | no      |
//! | `table`    | structure  | 20    | no      |
//! | `style`    | capability | 0     | yes     |
//! | `media`    | capability | 10    | yes     |
//! | `layout`   | capability | 20    | yes     |
//! | `inherit`  | capability | 30    | no      |
//! | `validate` | finalize   | 0     | off by default |

pub mod block;
pub mod inherit;
pub mod inspect;
pub mod layout;
pub mod list;
pub mod media;
pub mod style;
pub mod table;
pub mod validate;

use std::sync::Arc;

use crate::plugin::Plugin;

pub use block::BlockPlugin;
pub use inherit::InheritPlugin;
pub use inspect::InspectPlugin;
pub use layout::LayoutPlugin;
pub use list::ListPlugin;
pub use media::MediaPlugin;
pub use style::StylePlugin;
pub use table::TablePlugin;
pub use validate::ValidatePlugin;

/// Metadata key: number of `ul`/`ol` elements in the source markup.
///
/// Lists added by structure plugins are not counted.
pub const META_LISTS: &str = "markup.lists";
/// Metadata key: number of `table` elements in the source markup.
pub const META_TABLES: &str = "markup.tables";
/// Metadata key: number of unmapped elements dropped from the markup.
pub const META_DROPPED: &str = "markup.dropped";

/// The built-in plugin set, in registration order.
pub fn builtins() -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(InspectPlugin),
        Arc::new(BlockPlugin),
        Arc::new(ListPlugin),
        Arc::new(TablePlugin),
        Arc::new(StylePlugin),
        Arc::new(MediaPlugin),
        Arc::new(LayoutPlugin),
        Arc::new(InheritPlugin),
        Arc::new(ValidatePlugin),
    ]
}
