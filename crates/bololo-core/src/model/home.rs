// ── Home and room types ──

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub is_default: bool,
}

/// A home (site) owned by or shared with the account.
#[derive(Debug, Clone, Serialize)]
pub struct Home {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub owner: bool,
    pub rooms: Vec<Room>,
}

impl Home {
    pub fn room(&self, id: i64) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }
}
