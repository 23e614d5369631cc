mod bridge;
mod codec;
mod model;
mod store;

pub(crate) use bridge::apply_save_data;
pub use bridge::{save_data_from_engine, validate_save_data};
pub use codec::{
    export_to_base64, import_from_base64, import_save_text, load_from_json_string,
    save_to_json_string,
};
pub use model::{
    SAVE_VERSION, SaveAchievement, SaveAttachments, SaveData, SavePurchase, SaveResource,
    SaveStatistics,
};
pub use store::{FileSaveStore, MemorySaveStore, SaveStore};
