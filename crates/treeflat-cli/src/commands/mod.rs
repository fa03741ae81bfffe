pub mod flatten;
pub mod inspect;
pub mod roundtrip;
pub mod unflatten;
