//! 费用、缴费与分期

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::date_to_string;
use crate::entity::prelude::*;
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginationQuery,
    finance::{
        entities::{ClassFee, FeeType, Installment, InstallmentStatus, Payment, PaymentStatus},
        requests::{
            ClassFeeListParams, CreateFeeTypeRequest, CreateInstallmentRequest,
            CreatePaymentRequest, PaymentQuery, UpdateFeeTypeRequest,
        },
        responses::{MethodSummary, PaymentListResponse},
    },
};
use crate::utils::round2;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    // ==================== 费用类型 ====================

    pub async fn list_fee_types_impl(&self) -> Result<Vec<FeeType>> {
        use crate::entity::fee_types::Column;

        let fee_types = FeeTypes::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询费用类型失败: {e}")))?;

        Ok(fee_types.into_iter().map(|m| m.into_fee_type()).collect())
    }

    pub async fn get_fee_type_impl(&self, id: i64) -> Result<Option<FeeType>> {
        let result = FeeTypes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询费用类型失败: {e}")))?;

        Ok(result.map(|m| m.into_fee_type()))
    }

    pub async fn create_fee_type_impl(&self, req: CreateFeeTypeRequest) -> Result<FeeType> {
        let fee_type = FeeTypeActiveModel {
            code: Set(req.code),
            label: Set(req.label),
            amount: Set(req.amount),
            is_mandatory: Set(req.is_mandatory),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建费用类型失败", e))?;

        Ok(fee_type.into_fee_type())
    }

    pub async fn update_fee_type_impl(
        &self,
        id: i64,
        update: UpdateFeeTypeRequest,
    ) -> Result<Option<FeeType>> {
        if self.get_fee_type_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = FeeTypeActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(label) = update.label {
            model.label = Set(label);
        }
        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }
        if let Some(is_mandatory) = update.is_mandatory {
            model.is_mandatory = Set(is_mandatory);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新费用类型失败", e))?;

        Ok(Some(updated.into_fee_type()))
    }

    // ==================== 班级费用 ====================

    pub async fn list_class_fees_impl(&self, params: ClassFeeListParams) -> Result<Vec<ClassFee>> {
        use crate::entity::class_fees::Column;

        let mut select = ClassFees::find();
        if let Some(class_id) = params.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(academic_year_id) = params.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(academic_year_id));
        }

        let fees = select
            .order_by_asc(Column::ClassId)
            .order_by_asc(Column::FeeTypeId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询班级费用失败: {e}")))?;

        let fee_types: HashMap<i64, FeeTypeModel> = FeeTypes::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询费用类型失败: {e}")))?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        Ok(fees
            .into_iter()
            .map(|f| {
                let fee_type = fee_types.get(&f.fee_type_id).cloned();
                f.into_class_fee(fee_type)
            })
            .collect())
    }

    pub async fn create_class_fee_impl(
        &self,
        class_id: i64,
        fee_type_id: i64,
        amount: f64,
        academic_year_id: i64,
    ) -> Result<ClassFee> {
        let fee = ClassFeeActiveModel {
            class_id: Set(class_id),
            fee_type_id: Set(fee_type_id),
            amount: Set(amount),
            academic_year_id: Set(academic_year_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建班级费用失败", e))?;

        let fee_type = FeeTypes::find_by_id(fee_type_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询费用类型失败: {e}")))?;

        Ok(fee.into_class_fee(fee_type))
    }

    pub async fn delete_class_fee_impl(&self, id: i64) -> Result<bool> {
        let result = ClassFees::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除班级费用失败", e))?;

        Ok(result.rows_affected > 0)
    }

    // ==================== 缴费 ====================

    fn payment_select(query: &PaymentQuery) -> Select<Payments> {
        use crate::entity::payments::Column;

        let mut select = Payments::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(method) = query.method {
            select = select.filter(Column::Method.eq(method.as_str()));
        }
        if let Some(from) = query.date_from {
            select = select.filter(Column::PaidOn.gte(date_to_string(from)));
        }
        if let Some(to) = query.date_to {
            select = select.filter(Column::PaidOn.lte(date_to_string(to)));
        }

        select
            .order_by_desc(Column::PaidOn)
            .order_by_desc(Column::Id)
    }

    pub async fn list_payments_impl(&self, query: PaymentQuery) -> Result<PaymentListResponse> {
        let select = Self::payment_select(&query);
        let pagination = PaginationQuery {
            page: query.page as i64,
            size: query.size as i64,
        };

        let (payments, pagination) = self.fetch_page(select, &pagination, "缴费记录").await?;

        Ok(PaymentListResponse {
            items: payments.into_iter().map(|m| m.into_payment()).collect(),
            pagination,
        })
    }

    pub async fn list_payments_for_export_impl(&self, query: PaymentQuery) -> Result<Vec<Payment>> {
        let payments = Self::payment_select(&query)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("导出缴费记录失败: {e}")))?;

        Ok(payments.into_iter().map(|m| m.into_payment()).collect())
    }

    pub async fn create_payment_impl(
        &self,
        recorded_by: i64,
        req: CreatePaymentRequest,
        paid_on: NaiveDate,
    ) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();

        let payment = PaymentActiveModel {
            student_id: Set(req.student_id),
            fee_type_id: Set(req.fee_type_id),
            amount: Set(round2(req.amount)),
            method: Set(req.method.to_string()),
            reference: Set(req.reference),
            paid_on: Set(date_to_string(paid_on)),
            status: Set(PaymentStatus::Pending.to_string()),
            note: Set(req.note),
            rejection_reason: Set(None),
            recorded_by: Set(recorded_by),
            validated_by: Set(None),
            validated_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("登记缴费失败", e))?;

        Ok(payment.into_payment())
    }

    pub async fn get_payment_impl(&self, id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询缴费记录失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 验证缴费；同一学生同一费用类型下未结清的分期计划会累加已缴金额
    pub async fn validate_payment_impl(
        &self,
        id: i64,
        validated_by: i64,
    ) -> Result<Option<Payment>> {
        use crate::entity::installments::Column as InstallmentColumn;
        use crate::entity::payments::Column as PaymentColumn;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Payments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询缴费记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        // 只有待审核的缴费可以被验证；状态条件写在 UPDATE 里，重复提交只会命中一次
        let result = Payments::update_many()
            .col_expr(
                PaymentColumn::Status,
                Expr::value(PaymentStatus::Validated.to_string()),
            )
            .col_expr(PaymentColumn::ValidatedBy, Expr::value(validated_by))
            .col_expr(PaymentColumn::ValidatedAt, Expr::value(now))
            .col_expr(PaymentColumn::UpdatedAt, Expr::value(now))
            .filter(PaymentColumn::Id.eq(id))
            .filter(PaymentColumn::Status.eq(PaymentStatus::Pending.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("验证缴费失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CampusError::conflict(format!(
                "缴费 {id} 已处理，当前状态: {}",
                existing.status
            )));
        }

        let updated = Payments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询缴费记录失败: {e}")))?
            .ok_or_else(|| CampusError::not_found(format!("缴费 {id} 不存在")))?;

        let plan = Installments::find()
            .filter(InstallmentColumn::StudentId.eq(existing.student_id))
            .filter(InstallmentColumn::FeeTypeId.eq(existing.fee_type_id))
            .filter(InstallmentColumn::Status.ne(InstallmentStatus::Paid.as_str()))
            .order_by_asc(InstallmentColumn::Id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询分期计划失败: {e}")))?;

        if let Some(plan) = plan {
            let paid = round2(plan.paid_amount + existing.amount);
            InstallmentActiveModel {
                id: Set(plan.id),
                paid_amount: Set(paid),
                status: Set(InstallmentStatus::from_amounts(paid, plan.total_amount).to_string()),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新分期计划失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_payment()))
    }

    pub async fn reject_payment_impl(&self, id: i64, reason: &str) -> Result<Option<Payment>> {
        use crate::entity::payments::Column;

        if self.get_payment_impl(id).await?.is_none() {
            return Ok(None);
        }

        let result = Payments::update_many()
            .col_expr(
                Column::Status,
                Expr::value(PaymentStatus::Rejected.to_string()),
            )
            .col_expr(Column::RejectionReason, Expr::value(reason.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(PaymentStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("拒绝缴费失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CampusError::conflict(format!("缴费 {id} 已处理")));
        }

        self.get_payment_impl(id).await
    }

    pub async fn list_student_payments_impl(&self, student_id: i64) -> Result<Vec<Payment>> {
        let query = PaymentQuery {
            student_id: Some(student_id),
            ..Default::default()
        };

        self.list_payments_for_export_impl(query).await
    }

    // ==================== 分期 ====================

    pub async fn create_installment_impl(
        &self,
        req: CreateInstallmentRequest,
        due_date: Option<NaiveDate>,
    ) -> Result<Installment> {
        let now = chrono::Utc::now().timestamp();

        let plan = InstallmentActiveModel {
            student_id: Set(req.student_id),
            fee_type_id: Set(req.fee_type_id),
            total_amount: Set(round2(req.total_amount)),
            paid_amount: Set(0.0),
            due_date: Set(due_date.map(date_to_string)),
            status: Set(InstallmentStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建分期计划失败", e))?;

        Ok(plan.into_installment())
    }

    pub async fn list_student_installments_impl(&self, student_id: i64) -> Result<Vec<Installment>> {
        use crate::entity::installments::Column;

        let plans = Installments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询分期计划失败: {e}")))?;

        Ok(plans.into_iter().map(|m| m.into_installment()).collect())
    }

    // ==================== 报表 ====================

    fn validated_between(
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Select<Payments> {
        use crate::entity::payments::Column;

        let mut select =
            Payments::find().filter(Column::Status.eq(PaymentStatus::Validated.as_str()));
        if let Some(from) = date_from {
            select = select.filter(Column::PaidOn.gte(date_to_string(from)));
        }
        if let Some(to) = date_to {
            select = select.filter(Column::PaidOn.lte(date_to_string(to)));
        }
        select
    }

    pub async fn summarize_payments_by_method_impl(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<MethodSummary>> {
        use crate::entity::payments::Column;

        let rows = Self::validated_between(date_from, date_to)
            .select_only()
            .column(Column::Method)
            .column_as(Column::Amount.sum(), "total")
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Method)
            .order_by_asc(Column::Method)
            .into_tuple::<(String, Option<f64>, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("汇总缴费失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(method, total, count)| MethodSummary {
                method,
                total: round2(total.unwrap_or(0.0)),
                count,
            })
            .collect())
    }

    pub async fn sum_validated_payments_impl(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<(f64, u64)> {
        use crate::entity::payments::Column;

        let row = Self::validated_between(date_from, date_to)
            .select_only()
            .column_as(Column::Amount.sum(), "total")
            .column_as(Column::Id.count(), "count")
            .into_tuple::<(Option<f64>, i64)>()
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计缴费失败: {e}")))?;

        let (total, count) = row.unwrap_or((None, 0));
        Ok((round2(total.unwrap_or(0.0)), count.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::models::finance::entities::PaymentMethod;

    async fn fee_type(storage: &SeaOrmStorage) -> FeeType {
        storage
            .create_fee_type_impl(CreateFeeTypeRequest {
                code: "SCOL".into(),
                label: "Scolarité".into(),
                amount: 1000.0,
                is_mandatory: true,
            })
            .await
            .unwrap()
    }

    async fn pending_payment(
        storage: &SeaOrmStorage,
        student_id: i64,
        fee_type_id: i64,
        amount: f64,
    ) -> Payment {
        storage
            .create_payment_impl(
                1,
                CreatePaymentRequest {
                    student_id,
                    fee_type_id,
                    amount,
                    method: PaymentMethod::Cash,
                    reference: None,
                    paid_on: None,
                    note: None,
                },
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            )
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn test_installment_moves_from_pending_to_paid() {
        let storage = fixtures::memory_storage().await;
        let student = fixtures::student(&storage, "payeur", None, None).await;
        let fee = fee_type(&storage).await;

        let plan = storage
            .create_installment_impl(
                CreateInstallmentRequest {
                    student_id: student.id,
                    fee_type_id: fee.id,
                    total_amount: 1000.0,
                    due_date: None,
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(plan.status, InstallmentStatus::Pending);

        let first = pending_payment(&storage, student.id, fee.id, 400.0).await;
        storage.validate_payment_impl(first.id, 1).await.unwrap();
        let plans = storage.list_student_installments_impl(student.id).await.unwrap();
        assert_eq!(plans[0].status, InstallmentStatus::InProgress);
        assert_eq!(plans[0].paid_amount, 400.0);

        let second = pending_payment(&storage, student.id, fee.id, 600.0).await;
        storage.validate_payment_impl(second.id, 1).await.unwrap();
        let plans = storage.list_student_installments_impl(student.id).await.unwrap();
        assert_eq!(plans[0].status, InstallmentStatus::Paid);
        assert_eq!(plans[0].paid_amount, 1000.0);
    }

    #[actix_web::test]
    async fn test_validating_twice_credits_plan_once() {
        let storage = fixtures::memory_storage().await;
        let student = fixtures::student(&storage, "double", None, None).await;
        let fee = fee_type(&storage).await;
        storage
            .create_installment_impl(
                CreateInstallmentRequest {
                    student_id: student.id,
                    fee_type_id: fee.id,
                    total_amount: 1000.0,
                    due_date: None,
                },
                None,
            )
            .await
            .unwrap();

        let payment = pending_payment(&storage, student.id, fee.id, 400.0).await;
        let validated = storage.validate_payment_impl(payment.id, 1).await.unwrap().unwrap();
        assert_eq!(validated.status, PaymentStatus::Validated);
        assert_eq!(validated.validated_by, Some(1));

        let err = storage.validate_payment_impl(payment.id, 1).await.unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));

        let plans = storage.list_student_installments_impl(student.id).await.unwrap();
        assert_eq!(plans[0].paid_amount, 400.0);
        assert_eq!(plans[0].status, InstallmentStatus::InProgress);
    }

    #[actix_web::test]
    async fn test_processed_payment_cannot_be_rejected() {
        let storage = fixtures::memory_storage().await;
        let student = fixtures::student(&storage, "rejet", None, None).await;
        let fee = fee_type(&storage).await;

        let payment = pending_payment(&storage, student.id, fee.id, 50.0).await;
        storage.validate_payment_impl(payment.id, 1).await.unwrap();

        let err = storage.reject_payment_impl(payment.id, "doublon").await.unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));
        let stored = storage.get_payment_impl(payment.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Validated);
        assert!(stored.rejection_reason.is_none());

        assert!(storage.reject_payment_impl(9999, "absent").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_duplicate_class_fee_is_conflict() {
        let storage = fixtures::memory_storage().await;
        let school = fixtures::school(&storage).await;
        let class_id = fixtures::class(&storage, &school, "CF", 30).await;
        let fee = fee_type(&storage).await;

        storage
            .create_class_fee_impl(class_id, fee.id, 900.0, school.year_id)
            .await
            .unwrap();
        let err = storage
            .create_class_fee_impl(class_id, fee.id, 950.0, school.year_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));
    }

    #[actix_web::test]
    async fn test_summary_counts_only_validated_payments() {
        let storage = fixtures::memory_storage().await;
        let student = fixtures::student(&storage, "bilan", None, None).await;
        let fee = fee_type(&storage).await;

        let kept = pending_payment(&storage, student.id, fee.id, 120.5).await;
        pending_payment(&storage, student.id, fee.id, 80.0).await;
        storage.validate_payment_impl(kept.id, 1).await.unwrap();

        let (total, count) = storage.sum_validated_payments_impl(None, None).await.unwrap();
        assert_eq!(total, 120.5);
        assert_eq!(count, 1);

        let by_method = storage
            .summarize_payments_by_method_impl(None, None)
            .await
            .unwrap();
        assert_eq!(by_method.len(), 1);
        assert_eq!(by_method[0].method, "cash");
    }
}
