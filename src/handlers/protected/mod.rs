// handlers/protected - endpoints behind `require_auth`
//
// Every handler here can rely on an `AuthUser` extension; all store access is
// keyed by `auth_user.id`.

pub mod me;
pub mod recipe;
