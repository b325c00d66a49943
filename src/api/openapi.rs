use utoipa::OpenApi;

use crate::{
    api::models::HealthResponse,
    core::models::Settlement,
    infrastructure::store::records::{ErrorBody, ExpenseRecord, NewExpenseRecord, NewUserRecord, UserRecord},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health,
        super::handlers::list_users,
        super::handlers::get_user_by_auth_id,
        super::handlers::create_user,
        super::handlers::list_expenses,
        super::handlers::create_expense,
        super::handlers::list_settlements
    ),
    components(schemas(
        HealthResponse,
        UserRecord,
        NewUserRecord,
        ExpenseRecord,
        NewExpenseRecord,
        Settlement,
        ErrorBody
    )),
    info(
        title = "Splitledger Store API",
        description = "Users, shared expenses and the settlements that clear them",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
