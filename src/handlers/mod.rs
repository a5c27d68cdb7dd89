// handlers - two security tiers
//
// public:    no token required (/users/create, /users/token)
// protected: bearer token required (/users/me, /recipe/*)

pub mod protected;
pub mod public;
pub mod system;
