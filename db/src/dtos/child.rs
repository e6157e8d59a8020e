use uuid::Uuid;

pub struct ChildNew {
    pub parent_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub school_level: String,
}

pub struct ChildUpdate {
    pub first_name: String,
    pub last_name: String,
    pub school_level: String,
}
