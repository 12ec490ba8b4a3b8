//! Entity structs for all LoadDev domain objects.
//!
//! Each entity maps to one table. Ids are `None` until the first save and the
//! owner id is never sent to or accepted from clients; it is assigned from the
//! caller's identity on every write.

mod component;
mod group;
mod load;
mod rifle;
mod shot;

pub use component::{Case, Primer, Projectile, Propellant};
pub use group::Group;
pub use load::Load;
pub use rifle::{Rifle, Rifling, Zeroing};
pub use shot::Shot;

/// An entity that belongs to a single owner.
pub trait Owned {
    /// Name used in logs and not-found errors.
    const ENTITY: &'static str;

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: Option<i64>);
    fn owner_id(&self) -> &str;
    fn set_owner_id(&mut self, owner_id: &str);
}

macro_rules! impl_owned {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Owned for $ty {
                const ENTITY: &'static str = $name;

                fn id(&self) -> Option<i64> {
                    self.id
                }

                fn set_id(&mut self, id: Option<i64>) {
                    self.id = id;
                }

                fn owner_id(&self) -> &str {
                    &self.owner_id
                }

                fn set_owner_id(&mut self, owner_id: &str) {
                    owner_id.clone_into(&mut self.owner_id);
                }
            }
        )+
    };
}

impl_owned!(
    Rifle => "rifle",
    Load => "load",
    Group => "group",
    Shot => "shot",
    Projectile => "projectile",
    Propellant => "propellant",
    Primer => "primer",
    Case => "case",
);
