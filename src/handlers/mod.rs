// Handlers by security tier:
// public (no auth) and protected (bearer JWT, /api/v1/*)
pub mod protected;
pub mod public;
