mod exam_test;
mod progress_event_test;
