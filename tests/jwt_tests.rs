use cloudkitchen_backend::model::user::Role;
use cloudkitchen_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

fn jwt_utils() -> JwtTokenUtilsImpl {
    JwtTokenUtilsImpl::from_test_env()
}

#[test]
fn test_generate_and_validate_token() {
    let utils = jwt_utils();
    let token = utils
        .generate_token("64f000000000000000000001", "asha@example.com", Role::User)
        .unwrap();
    assert!(!token.is_empty());

    let claims = utils.validate_token(&token).unwrap();
    assert_eq!(claims.sub, "64f000000000000000000001");
    assert_eq!(claims.email, "asha@example.com");
    assert_eq!(claims.role(), Some(Role::User));
}

#[test]
fn test_token_carries_role() {
    let utils = jwt_utils();
    for role in [Role::Owner, Role::Admin, Role::User] {
        let token = utils
            .generate_token("64f000000000000000000002", "staff@example.com", role)
            .unwrap();
        let claims = utils.validate_token(&token).unwrap();
        assert_eq!(claims.role(), Some(role));
    }
}

#[test]
fn test_tampered_token_rejected() {
    let utils = jwt_utils();
    let token = utils
        .generate_token("64f000000000000000000003", "asha@example.com", Role::User)
        .unwrap();
    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('a') { 'b' } else { 'a' });
    assert!(utils.validate_token(&tampered).is_err());
}

#[test]
fn test_extract_token_from_header() {
    let utils = jwt_utils();
    assert_eq!(
        utils.extract_token_from_header("Bearer abc.def.ghi").unwrap(),
        "abc.def.ghi"
    );
    assert!(utils.extract_token_from_header("Basic abc").is_err());
    assert!(utils.extract_token_from_header("Bearer ").is_err());
    assert!(utils.extract_token_from_header("").is_err());
}

#[test]
fn test_tokens_have_unique_ids() {
    let utils = jwt_utils();
    let a = utils
        .generate_token("64f000000000000000000004", "asha@example.com", Role::User)
        .unwrap();
    let b = utils
        .generate_token("64f000000000000000000004", "asha@example.com", Role::User)
        .unwrap();
    let claims_a = utils.validate_token(&a).unwrap();
    let claims_b = utils.validate_token(&b).unwrap();
    assert_ne!(claims_a.jti, claims_b.jti);
}
