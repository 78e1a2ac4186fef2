pub mod entity;
pub mod play;
pub mod playbook;
pub mod role;

pub use entity::{Entity, EntityId, Roster};
pub use play::{Formation, FormationSlot, Play, PlayType, Route};
pub use playbook::{mesh, outside, single_back, PlayCatalog, PlaybookFile, PLAYBOOK};
pub use role::Role;
