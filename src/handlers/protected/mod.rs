// handlers/protected/mod.rs - endpoints behind jwt_auth_middleware
//
// Route prefix: /api/v1/*
// Every handler may extract `Extension<AuthUser>`.

pub mod auth;
pub mod report;
