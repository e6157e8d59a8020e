use uuid::Uuid;

pub struct ProfileNew {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
