pub mod arranger;
pub mod borrowing_organization;
pub mod composer;
pub mod concert;
pub mod concert_conductor;
pub mod concert_guest;
pub mod conductor;
pub mod genre;
pub mod guest;
pub mod loaning_organization;
pub mod piece;
pub mod piece_arranger;
pub mod piece_composer;
pub mod piece_genre;
pub mod piece_organization_relationship;
pub mod publisher;
pub mod rental_organization;
pub mod venue;
