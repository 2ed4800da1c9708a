pub mod ask_dto;
pub mod document_dto;
pub mod response_dto;

pub use ask_dto::{AnswerResponseDto, AskRequestDto, CitationDto};
pub use document_dto::{
    DocumentListResponseDto, DocumentResponseDto, UploadResponseDto,
};
pub use response_dto::{
    ApiError, ApiResponse, HealthResponseDto, MessageResponseDto, PaginationDto, PaginationMetaDto,
};
