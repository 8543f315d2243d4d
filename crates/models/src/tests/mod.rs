/// CRUD round trips against a live database; each test skips itself when no
/// database is reachable.
pub mod crud_tests;
