pub mod autohide;
pub mod fixup;
pub mod goto;
pub mod hide;
pub mod label;
pub mod move_commits;
pub mod pr;
pub mod push;
pub mod tree;
pub mod unhide;
pub mod upstream;

pub use autohide::*;
pub use fixup::*;
pub use goto::*;
pub use hide::*;
pub use label::*;
pub use move_commits::*;
pub use pr::*;
pub use push::*;
pub use tree::*;
pub use unhide::*;
pub use upstream::*;
