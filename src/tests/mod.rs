
mod conversion;
