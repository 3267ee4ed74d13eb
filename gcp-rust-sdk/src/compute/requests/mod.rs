mod get_image;
mod get_instance_group_manager;
mod get_instance_template;
mod insert_instance_group_manager;
mod insert_instance_template;
mod list_managed_instances;
mod wait_operation;

pub use get_image::*;
pub use get_instance_group_manager::*;
pub use get_instance_template::*;
pub use insert_instance_group_manager::*;
pub use insert_instance_template::*;
pub use list_managed_instances::*;
pub use wait_operation::*;
