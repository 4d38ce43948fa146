//! Entity definitions. Each struct derives its table metadata, input types,
//! relation resolvers and CRUD operations from the field attributes.

// Lookup tables
pub mod activity_type;
pub mod attestation_confidence;
pub mod chain;
pub mod chain_type;
pub mod contribution_status;
pub mod guild_membership_status;

// Identities
pub mod discord_user;
pub mod linear_issue;
pub mod linear_user;
pub mod twitter_tweet;
pub mod twitter_user;
pub mod user;

// DAOs
pub mod guild;
pub mod guild_activity_type;
pub mod guild_user;

// Contributions and the rows hanging off them
pub mod attestation;
pub mod contribution;
pub mod guild_contribution;
pub mod partner;
pub mod twitter_tweet_contribution;

pub use activity_type::*;
pub use attestation::*;
pub use attestation_confidence::*;
pub use chain::*;
pub use chain_type::*;
pub use contribution::*;
pub use contribution_status::*;
pub use discord_user::*;
pub use guild::*;
pub use guild_activity_type::*;
pub use guild_contribution::*;
pub use guild_membership_status::*;
pub use guild_user::*;
pub use linear_issue::*;
pub use linear_user::*;
pub use partner::*;
pub use twitter_tweet::*;
pub use twitter_tweet_contribution::*;
pub use twitter_user::*;
pub use user::*;
