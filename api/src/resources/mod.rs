//! Per-resource facades.
//!
//! Each facade borrows the client and exposes one method per backend
//! operation. Every method states its [`Access`](crate::Access) and the
//! response shape it expects; nothing is inferred from the path.

macro_rules! facade {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            client: &'a crate::client::AuthenticatedHttpClient,
        }

        impl<'a> $name<'a> {
            pub(crate) const fn new(client: &'a crate::client::AuthenticatedHttpClient) -> Self {
                Self { client }
            }
        }
    };
}

pub mod assignments;
pub mod auth;
pub mod campaigns;
pub mod categories;
pub mod creatives;
pub mod media;
pub mod news;
pub mod placements;
pub mod public;
pub mod tags;
pub mod users;

pub use assignments::AssignmentsApi;
pub use auth::AuthApi;
pub use campaigns::CampaignsApi;
pub use categories::CategoriesApi;
pub use creatives::CreativesApi;
pub use media::MediaApi;
pub use news::NewsApi;
pub use placements::PlacementsApi;
pub use public::PublicApi;
pub use tags::TagsApi;
pub use users::UsersApi;
