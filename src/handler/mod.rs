pub mod user_handler;
pub mod address_handler;
pub mod menu_handler;
pub mod category_handler;
pub mod cart_handler;
pub mod order_handler;
pub mod upload_handler;

use bson::oid::ObjectId;
use validator::Validate;

use crate::util::error::HandlerError;

pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw).map_err(|_| HandlerError::bad_request(format!("Invalid {} id", what)))
}

pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))
}
