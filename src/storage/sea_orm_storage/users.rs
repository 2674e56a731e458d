use super::profiles::ensure_class_has_room;
use super::{SeaOrmStorage, write_error};
use crate::entity::prelude::{ParentActiveModel, StudentActiveModel, TeacherActiveModel};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginationQuery,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::{escape_like_pattern, random_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户
    ///
    /// `req.password` 必须已经是哈希值。学生、教师、家长会在同一事务里创建对应档案。
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            phone: Set(req.phone),
            address: Set(req.address),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = model
            .insert(&txn)
            .await
            .map_err(|e| write_error("创建用户失败", e))?;

        match req.role {
            UserRole::Student => {
                let input = req.student.unwrap_or_default();
                if let Some(class_id) = input.class_id {
                    ensure_class_has_room(&txn, class_id, None).await?;
                }
                StudentActiveModel {
                    user_id: Set(user.id),
                    student_number: Set(random_code::student_number(user.id)),
                    birth_date: Set(input.birth_date),
                    gender: Set(input.gender),
                    class_id: Set(input.class_id),
                    academic_year_id: Set(input.academic_year_id),
                    enrolled_at: Set(now),
                    is_active: Set(true),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| write_error("创建学生档案失败", e))?;
            }
            UserRole::Teacher => {
                let input = req.teacher.unwrap_or_default();
                TeacherActiveModel {
                    user_id: Set(user.id),
                    staff_number: Set(random_code::staff_number(user.id)),
                    specialty: Set(input.specialty),
                    hired_on: Set(input.hired_on),
                    is_active: Set(true),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| write_error("创建教师档案失败", e))?;
            }
            UserRole::Parent => {
                let input = req.parent.unwrap_or_default();
                ParentActiveModel {
                    user_id: Set(user.id),
                    profession: Set(input.profession),
                    relationship: Set(input.relationship),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| write_error("创建家长档案失败", e))?;
            }
            UserRole::Admin | UserRole::Accountant => {}
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(user.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        } else if query.active_only {
            select = select.filter(Column::Status.eq(UserStatus::Active.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let pagination = PaginationQuery {
            page: query.page.unwrap_or(1),
            size: query.size.unwrap_or(10),
        };
        let (users, pagination) = self.fetch_page(select, &pagination, "用户").await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination,
        })
    }

    /// 通讯录搜索（仅活跃用户）
    pub async fn search_users_impl(&self, keyword: &str, limit: u64) -> Result<Vec<User>> {
        let escaped = escape_like_pattern(keyword.trim());

        let users = Users::find()
            .filter(Column::Status.eq(UserStatus::Active.to_string()))
            .filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            )
            .order_by_asc(Column::LastName)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("搜索用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }

        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新用户失败", e))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除用户失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::models::users::requests::StudentProfileInput;

    #[actix_web::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = fixtures::memory_storage().await;
        fixtures::user(&storage, "comptable", UserRole::Accountant).await;

        let mut again = fixtures::user_request("comptable", UserRole::Accountant);
        again.email = "autre@campus.local".into();
        let err = storage.create_user_impl(again).await.unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));
    }

    #[actix_web::test]
    async fn test_student_creation_stops_at_class_capacity() {
        let storage = fixtures::memory_storage().await;
        let school = fixtures::school(&storage).await;
        let class_id = fixtures::class(&storage, &school, "T1", 1).await;

        fixtures::student(&storage, "premier", Some(class_id), Some(school.year_id)).await;

        for name in ["second", "troisieme"] {
            let mut req = fixtures::user_request(name, UserRole::Student);
            req.student = Some(StudentProfileInput {
                class_id: Some(class_id),
                academic_year_id: Some(school.year_id),
                ..Default::default()
            });
            let err = storage.create_user_impl(req).await.unwrap_err();
            assert!(matches!(err, CampusError::ClassFull(_)));
        }

        // 事务回滚，账号本身也不应留下
        assert!(storage.get_user_by_username_impl("second").await.unwrap().is_none());
        let class = storage.get_class_impl(class_id).await.unwrap().unwrap();
        assert_eq!(class.headcount, 1);
    }

    #[actix_web::test]
    async fn test_student_creation_rejects_unknown_class() {
        let storage = fixtures::memory_storage().await;

        let mut req = fixtures::user_request("perdu", UserRole::Student);
        req.student = Some(StudentProfileInput {
            class_id: Some(999),
            ..Default::default()
        });
        let err = storage.create_user_impl(req).await.unwrap_err();
        assert!(matches!(err, CampusError::NotFound(_)));
    }
}
