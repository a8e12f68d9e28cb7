//! 示例服务

use component_macros::Component;
use di_abstractions::{Implements, Ref};
use tracing::info;

pub trait FirstService: Send + Sync {
    fn do_something(&self) -> anyhow::Result<()>;
}

pub trait SecondService: Send + Sync {
    fn do_something_else(&self);
}

#[derive(Component)]
#[component(auto_register)]
struct FirstServiceImpl {
    base: Implements<dyn FirstService>,
    second_service: Ref<dyn SecondService>,
}

impl FirstService for FirstServiceImpl {
    fn do_something(&self) -> anyhow::Result<()> {
        self.base.logger().in_scope(|| info!("Doing something"));
        self.second_service.get().do_something_else();
        Ok(())
    }
}

#[derive(Component)]
#[component(auto_register, tag = "default")]
struct DefaultSecondService {
    base: Implements<dyn SecondService>,
}

impl SecondService for DefaultSecondService {
    fn do_something_else(&self) {
        self.base
            .logger()
            .in_scope(|| info!("Doing something else on default"));
    }
}

#[derive(Component)]
#[component(auto_register, tag = "cloud")]
struct CloudSecondService {
    base: Implements<dyn SecondService>,
}

impl SecondService for CloudSecondService {
    fn do_something_else(&self) {
        self.base
            .logger()
            .in_scope(|| info!("Doing something else on cloud"));
    }
}
