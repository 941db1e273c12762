// Two handler tiers: public probes and the bearer-token-protected secrets API.
pub mod public;
pub mod secrets;
