#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    School = 2,
    Teacher = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::School),
            3 => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_round_trip() {
        for id in 1..=3u8 {
            let role = Role::from_id(id).unwrap();
            assert_eq!(role.id(), id);
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(4), None);
        assert_eq!(Role::from_id(255), None);
    }
}
