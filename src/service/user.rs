use log::info;
use uuid::Uuid;

use crate::{db, dto::NewUserDto, errors::MyError, models::User, PGPool};

use super::{access::not_found_as, crypto};

pub async fn create(dto: NewUserDto, pool: &PGPool) -> Result<User, MyError> {
    dto.validate()?;
    if db::user::exists(&dto.username, pool).await? {
        return Err(MyError::validation("username already registered"));
    }
    let pwd_salt = crypto::new_salt();
    let user = User {
        id: Uuid::new_v4(),
        username: dto.username,
        email: dto.email,
        full_name: dto.full_name,
        pwd_hash: crypto::hash_password(&dto.pwd, &pwd_salt),
        pwd_salt,
    };
    let user = db::user::create(&user, pool).await?;
    info!("registered user {} ({})", user.username, user.id);
    Ok(user)
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<User, MyError> {
    db::user::get_by_id(id, pool)
        .await
        .map_err(|err| not_found_as(err, "user not found"))
}
