// Two tiers: public (no key) and protected (API key required via middleware)
pub mod protected;
pub mod public;
