use sqlx::FromRow;

use crate::features::families::models::Member;

/// Normalized identity shared by every member of a duplicate group.
///
/// Names are compared case-insensitively; the birth date is compared as
/// raw text, so "1990-01-01" and "1990-1-1" are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
}

/// A member row tagged with its key as computed by the database
#[derive(Debug, Clone, FromRow)]
pub struct DuplicateCandidate {
    pub first_name_key: String,
    pub last_name_key: String,
    #[sqlx(flatten)]
    pub member: Member,
}

impl DuplicateCandidate {
    pub fn key(&self) -> DuplicateKey {
        DuplicateKey {
            first_name: self.first_name_key.clone(),
            last_name: self.last_name_key.clone(),
            date_of_birth: self.member.date_of_birth.clone(),
        }
    }
}

/// Members sharing one key, in insertion order
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub key: DuplicateKey,
    pub members: Vec<Member>,
}

/// Group candidates by key and keep groups with more than one member.
///
/// Input must be ordered by member id. Groups come out in order of their
/// earliest member and members keep their input order, so the first
/// member of each group is the earliest inserted.
pub fn group_duplicates(candidates: Vec<DuplicateCandidate>) -> Vec<DuplicateGroup> {
    let mut positions: std::collections::HashMap<DuplicateKey, usize> =
        std::collections::HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for candidate in candidates {
        let key = candidate.key();
        match positions.get(&key) {
            Some(&index) => groups[index].members.push(candidate.member),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    members: vec![candidate.member],
                });
            }
        }
    }

    groups.retain(|group| group.members.len() > 1);
    groups
}

/// Keep the first id, return the rest for deletion
pub fn split_keep_first(ids: &[i64]) -> (Option<i64>, Vec<i64>) {
    match ids.split_first() {
        Some((first, rest)) => (Some(*first), rest.to_vec()),
        None => (None, Vec::new()),
    }
}
