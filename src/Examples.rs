/// worked reactions: ammonia synthesis and its reverse
pub mod equilibrium_examples;
