mod llm;
mod observability;
