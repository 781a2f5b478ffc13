/// Use cases module containing application business logic orchestration
mod generate_notice;

pub use generate_notice::GenerateNoticeUseCase;
