// handlers/public - endpoints reachable without a token (signup and token exchange)

pub mod users;
