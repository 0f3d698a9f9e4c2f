pub mod response;
pub mod web_search;

pub use response::{Argument, Icon, Item, Modifier, Mods, Response, Text};
pub use web_search::{SearchModule, WebSearch};
