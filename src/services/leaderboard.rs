use serde::Serialize;

use crate::model::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedUser {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub position: String,
    pub score: i64,
    pub admin: bool,
}

/// Highest score first. Equal scores keep roster order.
pub fn order_by_score(users: &[User]) -> Vec<&User> {
    let mut ordered: Vec<&User> = users.iter().collect();
    ordered.sort_by(|a, b| b.score.cmp(&a.score));
    ordered
}

/// Pairs each user with their leaderboard row, ranks starting at 1.
pub fn ranked(users: &[User]) -> impl Iterator<Item = (RankedUser, &User)> {
    order_by_score(users)
        .into_iter()
        .enumerate()
        .map(|(i, user)| {
            let row = RankedUser {
                rank: i + 1,
                id: user.id.clone(),
                name: user.name.clone(),
                position: user.position.clone(),
                score: user.score,
                admin: user.admin,
            };
            (row, user)
        })
}

pub fn rank_by_score(users: &[User]) -> Vec<RankedUser> {
    ranked(users).map(|(row, _)| row).collect()
}
