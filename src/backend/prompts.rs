//! Shared prompts sent to remote extraction backends.

/// System prompt asking the model for a single structured intent.
pub fn extraction_prompt() -> String {
    "Extract information from the user message.\n\
     Identify if the user wants to create a \"task\", a new calendar \"event\", \
     or to set a \"reminder\" to do something.\n\
     The user may provide a date or a time, but they are not required.\n\
     'date' and 'time' fields, when filled, must always be in the future.\n\
     Extract the date and time from the title when informed.\n\
     If the title is longer than 50 characters, truncate it to 50 characters \
     and add \"...\" at the end.\n\n\
     Return ONLY a JSON object with:\n\
     {\n\
       \"task_type\": \"task\", \"event\", or \"reminder\",\n\
       \"title\": \"brief title\",\n\
       \"description\": \"detailed description\",\n\
       \"date\": \"YYYY-MM-DD\" (extract date or use today if not specified, never before today),\n\
       \"time\": \"HH:MM\" (extract time or null if not specified)\n\
     }"
        .to_string()
}

/// Prompt asking the model to segment a message into independent tasks.
pub fn split_prompt(text: &str) -> String {
    format!(
        "Your task is to split the following text into smaller tasks that can be \
         processed individually.\n\
         A task is something that needs to be done.\n\n\
         It is very important that the message is preserved; commas might appear in \
         the text. Do not blindly split by commas just because they are there.\n\n\
         If the text contains multiple tasks, split them into individual tasks.\n\
         If the text contains only one task, return just one task.\n\
         If just one temporal reference is present, add it to all tasks.\n\
         If more than one temporal reference is present, split tasks accordingly.\n\n\
         Clean linking terms in the language the text is written in, such as \
         \"and\", \"y\", \"also\", \"además\".\n\
         Examples:\n\
         Input: \"Go to the store, buy groceries, and clean the house.\"\n\
         Output: [\"Go to the store\", \"Buy groceries\", \"Clean the house\"]\n\n\
         NEVER CREATE ANY EVENT OR TASK, that is not your job.\n\
         Always return a JSON array of strings.\n\n\
         Text: '{text}'"
    )
}
