pub mod books;
pub mod newsletter;

use eddy_db::Gateway;
use eddy_kernel::ModuleRegistry;

/// Register all feature modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, gateway: &Gateway) {
    registry.register(books::create_module(gateway.clone()));
    registry.register(newsletter::create_module(gateway.clone()));
}
