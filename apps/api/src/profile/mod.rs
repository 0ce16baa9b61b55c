// Profile management: registration, skill profiles, admin user list,
// and the points leaderboard.

pub mod handlers;
pub mod skills;
