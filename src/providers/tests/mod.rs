mod reddit_tests;
