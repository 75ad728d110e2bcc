mod client;
mod errors;
mod memory;
mod types;

pub use client::HttpCms;
pub use errors::CmsError;
pub use memory::MemoryCms;
pub use types::{
    AiTask, ApiKeyStatus, Article, ArticleInput, ArticleList, ArticleQuery, ArticleStatus,
    Category, CategoryInput, CmsApi, GeneratedApiKey, ImageData, ImageInfo, ImageUpload, Settings,
    Tag, TagInput,
};
