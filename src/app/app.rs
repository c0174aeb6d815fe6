use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::{error, info, warn};

use crate::config::app_conf::AppConfig;
use crate::config::{
    CheckoutConfig, EmailConfig, JwtConfig, MinioConfig, MongoConfig, OwnerUserConfig,
    VerificationConfig,
};
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::address_repo::MongoAddressRepository;
use crate::repository::cart_repo::MongoCartRepository;
use crate::repository::category_repo::MongoCategoryRepository;
use crate::repository::menu_repo::MongoMenuRepository;
use crate::repository::mongo;
use crate::repository::order_repo::MongoOrderRepository;
use crate::repository::user_repo::MongoUserRepository;
use crate::router::address_router::address_router;
use crate::router::cart_router::cart_router;
use crate::router::category_router::category_router;
use crate::router::menu_router::menu_router;
use crate::router::order_router::order_router;
use crate::router::upload_router::upload_router;
use crate::router::user_router::user_router;
use crate::service::address_service::AddressServiceImpl;
use crate::service::cart_service::CartServiceImpl;
use crate::service::category_service::{CategoryService, CategoryServiceImpl};
use crate::service::menu_service::MenuServiceImpl;
use crate::service::order_service::OrderServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::email::SmtpEmailService;
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::storage::ImageStorageService;

pub struct App {
    config: AppConfig,
    router: Router,
    pub user_service: Arc<UserServiceImpl>,
    pub category_service: Arc<CategoryServiceImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let email_config = EmailConfig::from_env().expect("Email config error");
        let minio_config = MinioConfig::from_env().expect("Minio config error");
        let checkout_config = CheckoutConfig::from_env().expect("Checkout config error");
        let verification_config =
            VerificationConfig::from_env().expect("Verification config error");

        let db = mongo::connect(&mongo_config)
            .await
            .expect("MongoDB connection error");

        let user_repo = Arc::new(MongoUserRepository::new(&db));
        let address_repo = Arc::new(MongoAddressRepository::new(&db));
        let menu_repo = Arc::new(MongoMenuRepository::new(&db));
        let category_repo = Arc::new(MongoCategoryRepository::new(&db));
        let cart_repo = Arc::new(MongoCartRepository::new(&db));
        let order_repo = Arc::new(MongoOrderRepository::new(&db));

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let email_service =
            Arc::new(SmtpEmailService::new(email_config).expect("Email service error"));
        let storage = Arc::new(
            ImageStorageService::new(minio_config)
                .await
                .expect("Storage service error"),
        );

        let user_service = Arc::new(UserServiceImpl::new(
            user_repo.clone(),
            jwt_utils.clone(),
            email_service,
            verification_config,
        ));
        let address_service = Arc::new(AddressServiceImpl::new(address_repo.clone()));
        let menu_service = Arc::new(MenuServiceImpl::new(menu_repo.clone()));
        let category_service = Arc::new(CategoryServiceImpl::new(category_repo));
        let cart_service = Arc::new(CartServiceImpl::new(cart_repo.clone(), menu_repo.clone()));
        let order_service = Arc::new(OrderServiceImpl::new(
            order_repo,
            cart_repo,
            menu_repo,
            address_repo,
            checkout_config,
        ));

        let auth_state = Arc::new(AuthState {
            jwt_utils: jwt_utils.clone(),
        });

        let router = Router::new()
            .merge(user_router(user_service.clone(), auth_state.clone()))
            .merge(address_router(address_service, auth_state.clone()))
            .merge(menu_router(menu_service, auth_state.clone()))
            .merge(category_router(category_service.clone(), auth_state.clone()))
            .merge(cart_router(cart_service, auth_state.clone()))
            .merge(order_router(order_service, auth_state.clone()))
            .merge(upload_router(storage, auth_state))
            .route("/health", get(|| async { "OK" }));

        let app = App {
            config,
            router,
            user_service,
            category_service,
        };
        app.seed_categories().await;
        app.create_first_owner_user().await;
        app
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(
            self.config.host.parse().expect("Invalid host"),
            self.config.port,
        );
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }

    async fn seed_categories(&self) {
        if let Err(e) = self.category_service.seed_defaults().await {
            error!("Failed to seed default categories: {e}");
        }
    }

    async fn create_first_owner_user(&self) {
        let owner_conf = match OwnerUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Owner user config not loaded: {e}");
                return;
            }
        };
        match self.user_service.create_owner_if_missing(&owner_conf).await {
            Ok(()) => info!("Owner account ready"),
            Err(e) => error!("Failed to ensure owner account: {e}"),
        }
    }
}
