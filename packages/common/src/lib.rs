pub mod review_status;
pub mod slug;
pub mod vote_type;

pub use review_status::ReviewStatus;
pub use vote_type::VoteType;
