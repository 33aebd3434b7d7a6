pub mod params;
pub mod service;

use crate::config::Settings;
use crate::endpoint::{Handler, IntoEndpoint};
use crate::error::AppError;
use crate::router::service::RouterSvc;
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::{Method, Response};
use matchit::Router as MRouter;
use params::PathParams;
use std::{collections::HashMap, sync::Arc};
use tollgate_core::{BoxError, Req, Resp, Schemas, TollgateError, Validator};
use tower::{Layer, Service, util::BoxCloneService};

/// Tower 兼容的 Service 类型别名
pub type HttpSvc = BoxCloneService<Req, Resp, AppError>;

type TollgateLayer = Arc<dyn Fn(HttpSvc) -> HttpSvc + Send + Sync>;

/// 生成各 HTTP 方法的简化注册函数（如 get/post/...）
macro_rules! define_method {
    ($name:ident, $m:ident) => {
        /// 将端点绑定到给定路径上（此函数注册指定的 HTTP 方法）
        pub fn $name(&mut self, path: &str, endpoint: impl IntoEndpoint) -> &mut Self {
            self.route(Method::$m, path, endpoint)
        }
    };
}

/// 路由器，负责注册路由、挂载中间件并进行请求分发
///
/// 端点可以是 [`tollgate_core::validate`] / [`Validator`] 生成的校验管线，
/// 也可以是 [`crate::endpoint::plain`] 包装的普通 handler 或任意 [`HttpSvc`]。
#[derive(Clone)]
pub struct Router {
    /// 已注册的路由表（按方法分类）
    pub routes: HashMap<Method, MRouter<HttpSvc>>,
    /// 待应用的中间件层
    pub layers: Vec<TollgateLayer>,
    /// 请求处理时注入到每个端点的配置
    pub settings: Arc<Settings>,
}

impl Router {
    /// 创建一个空路由器，使用进程级配置 [`Settings::global`]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            layers: Vec::new(),
            settings: Arc::new(Settings::global().clone()),
        }
    }

    /// 替换该路由器使用的配置
    pub fn with_settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = Arc::new(settings);
        self
    }

    /// 根据方法与路径查找对应的处理 Service，并返回路径参数
    pub fn find_handler(&self, method: &Method, path: &str) -> Option<(HttpSvc, PathParams)> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        Some((matched.value.clone(), PathParams::from(&matched.params)))
    }

    /// 将端点挂载到指定方法与路径
    ///
    /// # Panics
    ///
    /// 路径语法非法或与已注册路由冲突时 panic
    pub fn route(&mut self, method: Method, path: &str, endpoint: impl IntoEndpoint) -> &mut Self {
        let svc = endpoint.into_endpoint();
        if let Err(e) = self.routes.entry(method.clone()).or_default().insert(path, svc) {
            panic!("Failed to register route {} {}: {}", method, path, e);
        }
        self
    }

    /// 以三段校验管线挂载 handler，校验失败时使用 `validator` 的错误处理器
    pub fn validated_route<H: Handler>(
        &mut self,
        method: Method,
        path: &str,
        validator: &Validator,
        schemas: Schemas,
        handler: H,
    ) -> &mut Self {
        self.route(method, path, validator.validate(schemas, handler))
    }

    define_method!(get, GET);
    define_method!(post, POST);
    define_method!(put, PUT);
    define_method!(delete, DELETE);
    define_method!(patch, PATCH);

    /// 追加一个中间件 Layer，稍后在 into_tower_service 时顺序应用
    pub fn with_layer<L, B>(&mut self, layer: L) -> &mut Self
    where
        L: Layer<HttpSvc> + Send + Sync + 'static,
        L::Service: Service<Req, Response = Response<B>> + Clone + Send + 'static,
        <L::Service as Service<Req>>::Error: Into<AppError> + Send + Sync + 'static,
        <L::Service as Service<Req>>::Future: Send + 'static,
        B: http_body::Body<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BoxError>,
    {
        self.layers.push(Arc::new(move |svc: HttpSvc| {
            let wrapped = layer.layer(svc);
            let standardized = tower::ServiceBuilder::new()
                .map_response(|resp: Response<B>| {
                    let (parts, body) = resp.into_parts();
                    let body = body.map_err(|e| TollgateError(e.into())).boxed();
                    Response::from_parts(parts, body)
                })
                .map_err(Into::into)
                .service(wrapped);
            BoxCloneService::new(standardized)
        }));
        self
    }

    /// 将路由器转换为 Tower Service，自动应用之前注册的 Layer
    pub fn into_tower_service(mut self) -> HttpSvc {
        let layers = std::mem::take(&mut self.layers);
        let mut svc: HttpSvc = BoxCloneService::new(RouterSvc { router: self });
        for apply in layers {
            svc = apply(svc);
        }
        svc
    }

    #[cfg(feature = "test")]
    pub fn test_client(self) -> crate::test::TestClient {
        crate::test::TestClient::new(self.into_tower_service())
    }
}
