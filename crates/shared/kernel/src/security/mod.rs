mod resource;

pub use resource::{MAX_NAME_LEN, MAX_OWNER_ID_LEN, ResourceGuard, ResourceGuardError};
